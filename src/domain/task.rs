/// Learning tasks: which door to open and how to talk about it.
///
/// Tasks are offered easiest first. The first task not yet completed is
/// the next one; once all are done the list starts over.

use std::collections::BTreeSet;

use super::entity::DoorId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub target: DoorId,
    pub text: &'static str,
    pub hint: &'static str,
    pub success: &'static str,
}

fn builtin_tasks() -> Vec<Task> {
    vec![
        Task {
            target: DoorId::Left,
            text: "Find the red key and open the LEFT door!",
            hint: "You need the red 🔑",
            success: "The red key opened the door! Level 1 clear!",
        },
        Task {
            target: DoorId::Middle,
            text: "Turn the green switch ON and open the MIDDLE door!",
            hint: "Turn the green 🔘 ON",
            success: "The green switch opened the door! Level 2 clear!",
        },
        Task {
            target: DoorId::Right,
            text: "Collect the star badge and open the RIGHT door!",
            hint: "You need the shiny ⭐",
            success: "The star badge opened the door! Level 3 clear!",
        },
    ]
}

pub struct TaskBook {
    tasks: Vec<Task>,
    completed: BTreeSet<usize>,
}

impl TaskBook {
    pub fn new() -> Self {
        TaskBook { tasks: builtin_tasks(), completed: BTreeSet::new() }
    }

    /// The task to offer next.
    pub fn next(&self) -> &Task {
        let idx = (0..self.tasks.len())
            .find(|i| !self.completed.contains(i))
            .unwrap_or(0);
        &self.tasks[idx]
    }

    /// Mark the task targeting `door` as done.
    /// Completing a task after a full round starts a new round.
    pub fn complete(&mut self, door: DoorId) {
        if let Some(idx) = self.tasks.iter().position(|t| t.target == door) {
            if self.completed.len() == self.tasks.len() {
                self.completed.clear();
            }
            self.completed.insert(idx);
        }
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_are_offered_in_order() {
        let mut book = TaskBook::new();
        assert_eq!(book.next().target, DoorId::Left);
        book.complete(DoorId::Left);
        assert_eq!(book.next().target, DoorId::Middle);
        book.complete(DoorId::Middle);
        assert_eq!(book.next().target, DoorId::Right);
    }

    #[test]
    fn skipped_task_is_offered_first() {
        let mut book = TaskBook::new();
        book.complete(DoorId::Middle);
        assert_eq!(book.next().target, DoorId::Left);
    }

    #[test]
    fn wraps_after_all_complete() {
        let mut book = TaskBook::new();
        for door in DoorId::ALL {
            book.complete(door);
        }
        assert_eq!(book.completed_count(), book.len());
        assert_eq!(book.next().target, DoorId::Left);

        book.complete(DoorId::Left);
        assert_eq!(book.completed_count(), 1);
        assert_eq!(book.next().target, DoorId::Middle);
    }
}
