pub mod morning_loop;
pub mod reminder_loop;
pub mod task_runner;
