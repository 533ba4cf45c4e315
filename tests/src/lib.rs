#[cfg(test)]
mod setup;
#[cfg(test)]
mod e2e;
