pub mod form;
pub mod prompt;
pub mod theme;
pub mod toast;

pub use form::{check_values, form_data, parse_assignments, populate_form, FormError, FormField, FormValues, FormView};
pub use prompt::{Prompt, ScriptedPrompt, TerminalPrompt};
pub use theme::{Preferences, Theme};
pub use toast::{Severity, Toast, ToastStack};
