pub mod credentials;
pub mod notice;
pub mod work_item;
pub mod workflow;
