//! Kernel diagnostic forwarding, observed through a capturing subscriber.
//!
//! Kept in its own test binary: the forwarding switch is process-wide.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use densela_linalg::{KernelDiagnostics, LinalgError, LuDecomp, Matrix, Vector};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn singular_solve_log(forward: bool) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let _guard = if forward {
            KernelDiagnostics::enable()
        } else {
            KernelDiagnostics::disable()
        };
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
        let b = Vector::from_slice(&[1.0, 1.0]).unwrap();
        let err = LuDecomp::new(&a).unwrap().solve(&b).unwrap_err();
        assert_eq!(err, LinalgError::SingularMatrix);
    });
    captured.text()
}

#[test]
fn test_singular_solve_forwards_only_when_enabled() {
    let silent = singular_solve_log(false);
    assert!(silent.is_empty(), "unexpected output: {}", silent);

    let forwarded = singular_solve_log(true);
    assert_eq!(forwarded.matches("ESING").count(), 1, "{}", forwarded);
    assert!(forwarded.contains("WARN"), "{}", forwarded);
    assert!(forwarded.contains("singular"), "{}", forwarded);
}
