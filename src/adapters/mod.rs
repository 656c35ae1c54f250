//! Port implementations: live HTTP adapters plus recording and replaying
//! wrappers used to capture and replay tracker sessions.

pub mod live;
pub mod recording;
pub mod replaying;
