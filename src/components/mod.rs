pub mod data_table;
