/*!
One module per endpoint family, mirroring the grouping in §4.1 (e.g.
`click` covers both `/click` and `/click/element`).
*/

pub mod accessibility;
pub mod click;
pub mod key;
pub mod menu;
pub mod misc;
pub mod screenshot;
pub mod scroll;
pub mod status;
pub mod type_text;
pub mod wait;
