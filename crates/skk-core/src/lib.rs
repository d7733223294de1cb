//! Configuration model for an SKK input method: the ordered dictionary
//! list, the add-dictionary form, rule discovery and engine settings.

pub mod dict_list;
pub mod form;
pub mod paths;
pub mod rules;
pub mod settings;
pub mod source;
