mod assign;
mod sgd;
mod updater;

pub use assign::Assign;
pub use sgd::Sgd;
pub use updater::Updater;
