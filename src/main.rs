use fnv_chain::{HashTable, TableError};

fn main() -> Result<(), TableError> {
    let mut table = HashTable::with_size(16)?;

    table.insert("foo", 1)?;
    table.insert("bar", 2)?;

    for key in ["foo", "bar"] {
        match table.search(key) {
            Some(value) => println!("{key}: {value}"),
            None => println!("{key}: <absent>"),
        }
    }

    Ok(())
}
