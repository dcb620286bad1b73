//! Line-oriented command shell driving a [`Tree`](crate::namespace::Tree).

mod command;
mod shell;

pub use shell::{Shell, ShellError};
