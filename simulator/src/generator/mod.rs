pub mod template;
pub mod traffic;
