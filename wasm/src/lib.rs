use aprstone_core::callsign::parse_path;
use aprstone_core::{AfskConfig, AprsError, Encoder, Frame};
use wasm_bindgen::prelude::*;

fn to_js(e: AprsError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn build_frame(
    callsign: &str,
    destination: &str,
    digipeaters: &str,
    info: &str,
) -> Result<Frame, AprsError> {
    Ok(Frame::ui(
        destination.parse()?,
        callsign.parse()?,
        parse_path(digipeaters)?,
        info,
    ))
}

#[wasm_bindgen]
pub struct WasmEncoder {
    inner: Encoder,
}

#[wasm_bindgen]
impl WasmEncoder {
    /// Create an encoder for the AudioContext's sample rate
    #[wasm_bindgen(constructor)]
    pub fn new(sample_rate: f64) -> Result<WasmEncoder, JsValue> {
        Encoder::new(AfskConfig::with_sample_rate(sample_rate))
            .map(|encoder| WasmEncoder { inner: encoder })
            .map_err(to_js)
    }

    /// Encode an APRS UI frame into audio samples
    /// Returns a Float32Array ready for an AudioBuffer
    #[wasm_bindgen]
    pub fn encode(
        &self,
        callsign: &str,
        destination: &str,
        digipeaters: &str,
        info: &str,
    ) -> Result<Vec<f32>, JsValue> {
        let frame = build_frame(callsign, destination, digipeaters, info).map_err(to_js)?;
        Ok(self.inner.encode_frame(&frame).collect())
    }

    /// Monitor-format rendering of the frame that `encode` would send
    #[wasm_bindgen]
    pub fn describe(
        &self,
        callsign: &str,
        destination: &str,
        digipeaters: &str,
        info: &str,
    ) -> Result<String, JsValue> {
        build_frame(callsign, destination, digipeaters, info)
            .map(|frame| frame.to_string())
            .map_err(to_js)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_frame() {
        let frame = build_frame("n0call-9", "APRS", "WIDE1-1", "!hello").unwrap();
        assert_eq!(frame.to_string(), "N0CALL-9>APRS,WIDE1-1:!hello");
    }

    #[test]
    fn test_build_frame_rejects_bad_source() {
        assert!(matches!(
            build_frame("N0CALL-99", "APRS", "", "x"),
            Err(AprsError::InvalidSsid(_))
        ));
    }
}
