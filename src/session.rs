pub mod booth;
