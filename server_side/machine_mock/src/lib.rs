pub mod powercore;
