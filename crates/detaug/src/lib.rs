#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use detaug_image as image;

#[doc(inline)]
pub use detaug_imgproc as imgproc;

#[doc(inline)]
pub use detaug_augment as augment;
