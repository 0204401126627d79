use tracing::info;

type Task = Box<dyn FnOnce() + Send>;

/// Collects startup closures (usually `tokio::spawn` calls) and runs them
/// together once wiring is complete.
#[derive(Default)]
pub struct TaskRunner {
    tasks: Vec<(&'static str, Task)>,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn add_task<F>(&mut self, name: &'static str, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tasks.push((name, Box::new(task)));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn start_all(self) {
        for (name, task) in self.tasks {
            info!(task = name, "starting task");
            task();
        }
    }
}
