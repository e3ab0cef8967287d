use crate::domain::event::LoanEvent;
use crate::error::Result;
use std::io::Write;

/// Appends emitted events as JSON lines to any `Write` sink.
pub struct EventLog<W: Write> {
    sink: W,
}

impl<W: Write> EventLog<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn append(&mut self, event: &LoanEvent) -> Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(self.sink, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::loan::LoanId;

    #[test]
    fn test_append_writes_one_line_per_event() {
        let mut out = Vec::new();
        let mut log = EventLog::new(&mut out);

        log.append(&LoanEvent::RequestClosed {
            loan_id: LoanId::new(1),
        })
        .unwrap();
        log.append(&LoanEvent::RequestRejected {
            loan_id: LoanId::new(2),
        })
        .unwrap();

        let output = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"event\":\"RequestClosed\""));
        assert!(lines[1].contains("\"loan_id\":2"));
    }
}
