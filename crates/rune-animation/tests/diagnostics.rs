use std::io::Write;
use std::sync::{Arc, Mutex};

use palette::Srgba;
use rune_animation::{interpolate_values, AnimationConfig, PropertyValue};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn kind_mismatch_is_logged_and_degrades() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();

    let from = PropertyValue::Number(1.0);
    let to = PropertyValue::Colour(Srgba::new(0, 0, 0, 255));
    let config = AnimationConfig::default();
    let value = tracing::subscriber::with_default(subscriber, || {
        interpolate_values(&from, &to, 0.5, &config)
    });

    assert_eq!(value, from);
    let output = logs.contents();
    assert!(output.contains("WARN"), "{output}");
    assert!(output.contains("only numbers, colours and transforms can be interpolated"), "{output}");
}
