mod free_spot;
mod picking;
mod ring_sampler;

#[doc(inline)]
pub use free_spot::{fits_in_conduit, find_conduit_under, find_free_spot, find_free_spot_in_conduit};
#[doc(inline)]
pub use picking::pick_at;
#[doc(inline)]
pub use ring_sampler::RingSampler;
