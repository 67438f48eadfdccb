// Integration scenarios: config files, on-disk projects and timer-driven ticks.
mod config_file;
mod project_search;
mod timer_driver;
