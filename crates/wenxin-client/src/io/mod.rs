mod lines;

pub use lines::Lines;
#[cfg(test)]
pub use lines::VecBody;
