mod build;
mod misc;
mod notes;
mod session;
mod support;
mod sync;
