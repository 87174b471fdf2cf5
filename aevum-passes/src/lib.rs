pub mod return_check;
