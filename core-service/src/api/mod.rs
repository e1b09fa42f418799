//! API Module
//!
//! Surface consumed by the presentation layer.
//!
//! Structure:
//! - form.rs: TransactionForm, the command facade bound to one mounted form
//! - view.rs: TransactionView render model
//! - demo.rs: scripted interaction profiles for the demo binary

pub mod demo;
pub mod form;
pub mod view;

pub use form::TransactionForm;
pub use view::TransactionView;
