mod scene_to_dxf;

#[doc(inline)]
pub use scene_to_dxf::*;
