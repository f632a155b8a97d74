use clap::Parser;
use rppal::gpio::Gpio;
use toggle_shutdown::config::PinArgs;
use toggle_shutdown::pins::print_gpio_status;

// Needs root for access to the GPIO registers.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = PinArgs::parse();

    let result = Gpio::new()
        .map_err(Box::<dyn std::error::Error>::from)
        .and_then(|gpio| {
            print_gpio_status(&gpio, args.first..args.last, &mut std::io::stdout().lock())
                .map_err(Into::into)
        });

    println!("done");

    result
}
