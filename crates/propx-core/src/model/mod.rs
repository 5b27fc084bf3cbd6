pub mod class;
pub mod descriptor;
pub mod has_props;
pub mod listener;
pub mod model_ref;

pub use class::{ClassBuilder, DeclareFn, ModelClass};
pub use descriptor::{PropertyDescriptor, PropertyTable};
pub use has_props::HasProps;
pub use listener::{Change, ChangeListener};
pub use model_ref::ModelRef;
