pub use kernel::id::ProductId;
