use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use log::debug;

use matrix_calc::matrix::dense::Matrix;

/// Whitespace-separated token stream over stdin, so elements may be entered
/// one per line or a whole row at a time.
struct TokenReader<R> {
    reader: R,
    tokens: VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    fn new(reader: R) -> Self {
        TokenReader {
            reader,
            tokens: VecDeque::new(),
        }
    }

    fn next<T: FromStr>(&mut self, what: &str) -> Result<T>
    where
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        loop {
            if let Some(token) = self.tokens.pop_front() {
                return token
                    .parse::<T>()
                    .with_context(|| format!("invalid {what}: {token:?}"));
            }

            let mut line = String::new();
            if self
                .reader
                .read_line(&mut line)
                .context("reading from stdin")?
                == 0
            {
                bail!("unexpected end of input while reading {what}");
            }
            self.tokens
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }
}

fn read_matrix<R: BufRead>(input: &mut TokenReader<R>, label: &str) -> Result<Matrix<f64>> {
    println!("Enter the number of rows for {label}:");
    let rows: usize = input.next("row count")?;
    println!("Enter the number of columns for {label}:");
    let cols: usize = input.next("column count")?;

    println!("Enter the elements of {label} ({rows}x{cols}, row by row):");
    let mut matrix = Matrix::new(rows, cols);
    for r in 0..rows {
        for c in 0..cols {
            let value: f64 = input.next("matrix element")?;
            matrix.set(r, c, value)?;
        }
    }
    debug!("read {label}: {rows}x{cols}");
    Ok(matrix)
}

fn main() -> Result<()> {
    env_logger::init();

    println!("Matrix Calculator");
    println!("1. Add Matrices");
    println!("2. Subtract Matrices");
    println!("3. Multiply Matrices");
    println!("4. Find Determinant");
    println!("5. Find Transpose");
    println!("6. Scalar Multiplication");
    println!("7. Generate Identity Matrix");
    println!("8. Matrix Power");
    println!("Enter your choice (1-8):");

    let mut input = TokenReader::new(io::stdin().lock());
    let choice: u32 = input.next("menu choice")?;
    debug!("menu choice: {choice}");

    match choice {
        1 | 2 | 3 => {
            let a = read_matrix(&mut input, "the first matrix")?;
            let b = read_matrix(&mut input, "the second matrix")?;
            let result = match choice {
                1 => (&a + &b)?,
                2 => (&a - &b)?,
                _ => (&a * &b)?,
            };
            println!("Result:");
            print!("{result:.2}");
        }
        4 => {
            let matrix = read_matrix(&mut input, "the matrix")?;
            let det = matrix.determinant()?;
            println!("Determinant: {det:.2}");
        }
        5 => {
            let matrix = read_matrix(&mut input, "the matrix")?;
            println!("Transpose:");
            print!("{:.2}", matrix.transpose());
        }
        6 => {
            println!("Enter the scalar value:");
            let scalar: f64 = input.next("scalar")?;
            let matrix = read_matrix(&mut input, "the matrix")?;
            println!("Result:");
            print!("{:.2}", &matrix * scalar);
        }
        7 => {
            println!("Enter the size of the identity matrix:");
            let size: usize = input.next("identity size")?;
            println!("Identity Matrix:");
            print!("{:.2}", Matrix::<f64>::identity(size));
        }
        8 => {
            let matrix = read_matrix(&mut input, "the matrix")?;
            println!("Enter the exponent:");
            let exponent: i64 = input.next("exponent")?;
            println!("Result:");
            print!("{:.2}", matrix.pow(exponent)?);
        }
        _ => bail!("invalid choice: {choice}"),
    }

    Ok(())
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_token_reader() {
        let mut input = TokenReader::new(Cursor::new("1 2\n3\n\n4.5\n"));
        assert_eq!(input.next::<usize>("n").unwrap(), 1);
        assert_eq!(input.next::<usize>("n").unwrap(), 2);
        assert_eq!(input.next::<i64>("n").unwrap(), 3);
        assert_eq!(input.next::<f64>("n").unwrap(), 4.5);
        assert!(input.next::<usize>("n").is_err());
    }

    #[test]
    fn test_token_reader_parse_failure() {
        let mut input = TokenReader::new(Cursor::new("abc\n"));
        let err = input.next::<usize>("row count").unwrap_err();
        assert!(err.to_string().contains("row count"));
    }

    #[test]
    fn test_read_matrix() {
        let mut input = TokenReader::new(Cursor::new("2 2\n1 2\n3 4\n"));
        let matrix = read_matrix(&mut input, "the matrix").unwrap();
        assert_eq!(
            matrix.to_rows(),
            vec![vec![1.0, 2.0], vec![3.0, 4.0]]
        );
    }
}
