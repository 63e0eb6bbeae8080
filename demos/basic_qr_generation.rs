use qrweave::{ECLevel, QRBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let data = std::env::args().nth(1).unwrap_or_else(|| "Hello, World!".to_string());
    let ecl = match std::env::args().nth(2) {
        Some(s) => s.parse::<ECLevel>()?,
        None => ECLevel::M,
    };

    let qr = QRBuilder::new(&data).ec_level(ecl).build()?;
    println!("{}", qr.metadata());
    print!("{}", qr.to_str(1));

    let img = qr.to_image(8);
    img.save("qr.png")?;
    println!("Saved qr.png ({}x{})", img.width(), img.height());

    Ok(())
}
