mod basic;
mod finite;
