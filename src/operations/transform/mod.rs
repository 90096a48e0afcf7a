mod general;
mod mirror;
mod rotate;
mod scale;
mod skew;
mod translate;

pub use general::GeneralTransform;
pub use mirror::Mirror;
pub use rotate::Rotate;
pub use scale::Scale;
pub use skew::Skew;
pub use translate::Translate;
