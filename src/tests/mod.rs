#[cfg(test)]
mod common;



#[cfg(test)]
mod properties_test;
