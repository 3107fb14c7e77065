mod help;
mod session;
mod viewer;

pub use viewer::Viewer;
