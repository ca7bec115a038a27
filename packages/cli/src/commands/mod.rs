pub mod compile;
pub mod init;
pub mod push;
pub mod snippets;

pub use compile::{compile, CompileArgs};
pub use init::{init, InitArgs};
pub use push::{push, PushArgs};
pub use snippets::{snippets, SnippetsCommand};
