// Form inputs parsed into validated drafts before anything reaches the store
pub mod consumption_form;
pub mod item_form;

pub use consumption_form::ConsumptionForm;
pub use item_form::NewItemForm;
