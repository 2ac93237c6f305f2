pub mod wts;
