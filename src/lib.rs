mod env;
mod error;
mod key;
mod loader;
mod parser;
mod types;

pub use env::EnvMap;
pub use error::Error;
pub use key::{is_valid_key, validate_key};
pub use loader::{Envik, EnvikBuilder, OwnedEnvikBuilder};
pub use parser::Parser;
pub use types::ParseOptions;

pub fn parse(input: &str) -> Result<EnvMap, Error> {
    Parser::new(input).parse()
}

pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<EnvMap, Error> {
    Parser::with_options(input, options).parse()
}
