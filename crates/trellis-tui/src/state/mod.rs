pub mod commands;
pub mod domain;
pub mod navigation;

pub use commands::{CommandOutcome, ResultsSource, StoreCommand};
pub use domain::{move_between_lists, DomainState, DomainStore};
pub use navigation::{
    reduce, ConfirmAction, Mode, NavAction, NavigationState, NavigationStore, StatusKind,
    StatusMessage, View,
};
