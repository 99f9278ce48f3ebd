//! Generates the content of object identifiers.
//!
//! Provide a sequence of object identifiers in ‘dot integer’ notation and
//! you will receive the octet array for each of them, ready for use in the
//! definition of a `ConstOid`.

use std::env;
use bercert::Oid;

fn process_one(arg: &str) -> Result<(), String> {
    let oid = arg.parse::<Oid>().map_err(|err| err.to_string())?;
    let mut first = true;
    print!("[");
    for item in oid.as_slice() {
        if !first { print!(", "); }
        else { first = false }
        print!("{}", item);
    }
    println!("]");
    Ok(())
}

fn main() {
    for arg in env::args().skip(1) {
        if let Err(err) = process_one(&arg) {
            println!("{}: {}.", arg, err)
        }
    }
}
