mod env;
mod listener;
mod matcher;
mod runner;
mod supervisor;
