pub trait Printer {
    fn print_line(&mut self, line: &str);
}

pub struct StdoutPrinter {}

impl Printer for StdoutPrinter {
    fn print_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Keeps every printed line, for tests.
#[cfg(test)]
#[derive(Default)]
pub struct CapturePrinter {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl Printer for CapturePrinter {
    fn print_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}
