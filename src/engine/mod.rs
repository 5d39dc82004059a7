mod completion;
mod engine;
mod inline;
mod op;
mod threaded;
mod var;

pub use completion::Completion;
pub use engine::Engine;
pub use inline::InlineEngine;
pub use threaded::ThreadedEngine;
pub use var::Var;
