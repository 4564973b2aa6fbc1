mod conv;
mod shape;
