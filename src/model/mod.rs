pub(crate) mod beat;
pub(crate) mod direction;
pub(crate) mod lyrics;
pub(crate) mod song;
