pub mod gmt;
pub mod rnk;

#[cfg(test)]
#[path = "../../tests/src_inline/formats/tests.rs"]
mod tests;
