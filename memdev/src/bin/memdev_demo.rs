//! Endpoint store demo
//!
//! Builds a two-endpoint store, attaches sessions, and walks the canonical
//! write/read cycle. Run with `RUST_LOG=debug` to see the data path logs.

use memdev::EndpointStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let store = EndpointStore::initialize(2)?;
    println!("store ready with {} endpoints", store.endpoint_count());

    let mut session = store.attach(0)?;
    let mut buf = [0u8; 16];
    let n = session.read(&mut buf)?;
    println!(
        "initial content of endpoint 0: {:?}",
        String::from_utf8_lossy(&buf[..n])
    );

    session.detach();

    let mut writer = store.attach(0)?;
    let written = writer.write(b"hello")?;
    println!("wrote {written} bytes, endpoint resized to the new length");
    writer.detach();

    let mut reader = store.attach(0)?;
    let n = reader.read(&mut buf)?;
    println!(
        "endpoint 0 now holds {:?} ({n} bytes)",
        String::from_utf8_lossy(&buf[..n])
    );
    let n = reader.read(&mut buf)?;
    println!("second read returned {n} bytes (end of data)");
    reader.detach();

    Ok(())
}
