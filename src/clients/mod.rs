pub mod edamam;
