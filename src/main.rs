use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use nearmap::config::{
    DEFAULT_RADIUS, DEFAULT_SERVICE, FileConfig, IpLocateConfig, NominatimConfig, OverpassConfig,
    TileConfig, default_services,
};
use nearmap::domain::Location;
use nearmap::locate::{FixedLocator, GeocodeLocator, IpLocator, Locator};
use nearmap::logging::init_cli_logger;
use nearmap::render::{OutputFormat, render};
use nearmap::session::{OverpassSource, ServiceSelector, Session};

/// Find nearby OpenStreetMap amenities and plot them on a map
///
/// Examples:
///   # Hospitals around your IP-based location, written to nearmap.html
///   nearmap
///
///   # Pharmacies within 2 km of a fixed point, as a table on stdout
///   nearmap --lat 12.9716 --lon 77.5946 -s pharmacy -r 2000 -f table
///
///   # Police stations near a named place, exported as GeoJSON
///   nearmap -p "Connaught Place, New Delhi" -s police -f geojson -o police.geojson
///
///   # Keep the session open and switch service types by typing them
///   nearmap --watch
#[derive(Parser, Debug)]
#[command(name = "nearmap")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches nearmap.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Latitude of your position (use with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of your position (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Place name to geocode instead of coordinates (e.g. "Pune, India")
    #[arg(short = 'p', long, conflicts_with = "lat")]
    place: Option<String>,

    /// Service type to search for (an OSM amenity value)
    #[arg(short = 's', long)]
    service: Option<String>,

    /// Search radius in meters
    #[arg(short = 'r', long)]
    radius: Option<u32>,

    /// Output file (defaults to nearmap.html for html, stdout otherwise)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum)]
    format: Option<OutputFormat>,

    /// Read service type changes from stdin, one per line, and re-render after each
    #[arg(short = 'w', long)]
    watch: bool,

    /// Print the selectable service types and exit
    #[arg(long)]
    list_services: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Where rendered output goes
enum Sink {
    File(PathBuf),
    Stdout,
}

impl Sink {
    fn write(&self, contents: &str) -> Result<()> {
        match self {
            Sink::File(path) => std::fs::write(path, contents)
                .with_context(|| format!("Failed to write output file: {}", path.display())),
            Sink::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(contents.as_bytes())
                    .and_then(|_| stdout.flush())
                    .context("Failed to write to stdout")
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = match args.config {
        Some(ref config_path) => Some(FileConfig::load_from(config_path)?),
        None => FileConfig::load(),
    };

    let verbose = args.verbose || file_config.as_ref().map(|c| c.verbose).unwrap_or(false);
    init_cli_logger(verbose);

    let lat = args
        .lat
        .or_else(|| file_config.as_ref().and_then(|c| c.lat));
    let lon = args
        .lon
        .or_else(|| file_config.as_ref().and_then(|c| c.lon));
    let place = args
        .place
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.place.clone()));
    let radius = args
        .radius
        .or_else(|| file_config.as_ref().map(|c| c.radius))
        .unwrap_or(DEFAULT_RADIUS);
    let service = args
        .service
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.service.clone()))
        .unwrap_or_else(|| DEFAULT_SERVICE.to_string());
    let services = file_config
        .as_ref()
        .and_then(|c| c.services.clone())
        .unwrap_or_else(default_services);
    let format = args
        .format
        .or_else(|| file_config.as_ref().and_then(|c| c.format))
        .unwrap_or_default();
    let output = args
        .output
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.output.clone()));

    let overpass_config = file_config
        .as_ref()
        .and_then(|c| c.overpass.clone())
        .unwrap_or_default();
    let nominatim_config = file_config
        .as_ref()
        .and_then(|c| c.nominatim.clone())
        .unwrap_or_default();
    let ip_config = file_config
        .as_ref()
        .and_then(|c| c.ip_locate.clone())
        .unwrap_or_default();
    let tiles = file_config
        .as_ref()
        .and_then(|c| c.tiles.clone())
        .unwrap_or_default();

    if lat.is_some() != lon.is_some() {
        bail!("--lat and --lon must be given together");
    }
    if radius == 0 {
        bail!("--radius must be greater than zero");
    }

    let selector = ServiceSelector::new(services.as_slice(), Some(service.as_str()))
        .with_context(|| format!("Invalid service type {:?}", service))?;

    if args.list_services {
        for option in selector.options() {
            let marker = if option == selector.current() { "*" } else { " " };
            println!("{} {}", marker, option);
        }
        return Ok(());
    }

    let sink = match output {
        Some(path) => Sink::File(path),
        None if format == OutputFormat::Html => {
            Sink::File(PathBuf::from(format!("nearmap.{}", format.extension())))
        }
        None => Sink::Stdout,
    };

    let locator = build_locator(
        lat.zip(lon).map(Location::from),
        place,
        nominatim_config,
        ip_config,
    );
    tracing::debug!(
        radius,
        service = %selector.current(),
        overpass = %overpass_config.url,
        "Starting session"
    );

    let mut session = start_session(locator, overpass_config, selector, radius, tiles);
    write_map(&session, format, &sink)?;

    if args.watch {
        watch_stdin(&mut session, format, &sink)?;
    }

    Ok(())
}

fn build_locator(
    coordinates: Option<Location>,
    place: Option<String>,
    nominatim: NominatimConfig,
    ip: IpLocateConfig,
) -> Box<dyn Locator> {
    if let Some(location) = coordinates {
        Box::new(FixedLocator::new(location))
    } else if let Some(place) = place {
        Box::new(GeocodeLocator::new(place, nominatim))
    } else {
        Box::new(IpLocator::new(ip))
    }
}

fn start_session(
    locator: Box<dyn Locator>,
    overpass: OverpassConfig,
    selector: ServiceSelector,
    radius: u32,
    tiles: TileConfig,
) -> Session {
    let spinner = create_spinner(&format!("Locating via {}...", locator.describe()));
    let mut session = Session::new(
        locator,
        Box::new(OverpassSource::new(overpass)),
        selector,
        radius,
        tiles,
    );

    let found = session.start();
    finish_spinner(&spinner, &session, found);
    session
}

/// Handle one service type per stdin line until EOF or `quit`
fn watch_stdin(session: &mut Session, format: OutputFormat, sink: &Sink) -> Result<()> {
    eprintln!(
        "Type a service type and press enter ({}), or 'quit' to stop.",
        session
            .selector()
            .options()
            .iter()
            .map(|o| o.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    watch_lines(session, io::stdin().lock(), format, sink)?;
    Ok(())
}

/// Treat each non-blank line as one selector change event.
///
/// Stops at EOF or at a `quit`/`exit` line. Returns the number of changes handled.
fn watch_lines(
    session: &mut Session,
    input: impl BufRead,
    format: OutputFormat,
    sink: &Sink,
) -> Result<usize> {
    let mut changes = 0;

    for line in input.lines() {
        let line = line.context("Failed to read from stdin")?;
        let value = line.trim();
        if value.is_empty() {
            continue;
        }
        if value.eq_ignore_ascii_case("quit") || value.eq_ignore_ascii_case("exit") {
            break;
        }

        let spinner = create_spinner(&format!("Searching for {}...", value));
        let found = session.select_service(value);
        finish_spinner(&spinner, session, found);
        changes += 1;

        write_map(session, format, sink)?;
    }

    Ok(changes)
}

fn write_map(session: &Session, format: OutputFormat, sink: &Sink) -> Result<()> {
    let title = format!("Nearby {}", session.selected().label());
    sink.write(&render(session.map(), format, &title))?;
    if let Sink::File(path) = sink {
        tracing::info!("Wrote {}", path.display());
    }
    Ok(())
}

fn finish_spinner(spinner: &ProgressBar, session: &Session, found: Option<usize>) {
    match found {
        Some(count) => spinner.finish_with_message(format!(
            "Found {} {} within {}m of {}",
            count,
            session.selected().label(),
            session.radius_m(),
            session
                .location()
                .map(|l| l.to_string())
                .unwrap_or_default()
        )),
        None => spinner.finish_and_clear(),
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use nearmap::domain::{Amenity, Place};
    use nearmap::session::PlaceSource;
    use std::io::Cursor;

    /// One place per query, right next to the search centre
    struct SinglePlaceSource;

    impl PlaceSource for SinglePlaceSource {
        fn nearby(&self, center: Location, _radius_m: u32, amenity: &Amenity) -> Result<Vec<Place>> {
            Ok(vec![
                Place::new(1, Location::new(center.lat + 0.001, center.lon))
                    .with_name(format!("First {}", amenity.label())),
            ])
        }
    }

    fn located_session() -> Session {
        let selector = ServiceSelector::new(&["hospital", "police", "pharmacy"], None).unwrap();
        let mut session = Session::new(
            Box::new(FixedLocator::new(Location::new(12.97, 77.59))),
            Box::new(SinglePlaceSource),
            selector,
            5000,
            TileConfig::default(),
        );
        session.start();
        session
    }

    #[test]
    fn test_watch_lines_skips_blanks_and_stops_at_quit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let sink = Sink::File(path.clone());
        let mut session = located_session();
        assert_eq!(session.queries_issued(), 1);

        let input = Cursor::new("\npolice\n\nquit\npharmacy\n");
        let changes = watch_lines(&mut session, input, OutputFormat::Table, &sink).unwrap();

        assert_eq!(changes, 1);
        assert_eq!(session.queries_issued(), 2);
        assert_eq!(session.selected().as_str(), "police");

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Nearby police\n"));
        assert!(written.contains("First police"));
    }

    #[test]
    fn test_watch_lines_runs_until_eof() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Sink::File(dir.path().join("out.geojson"));
        let mut session = located_session();

        let input = Cursor::new("  police  \npharmacy");
        let changes = watch_lines(&mut session, input, OutputFormat::Geojson, &sink).unwrap();

        assert_eq!(changes, 2);
        assert_eq!(session.queries_issued(), 3);
        assert_eq!(session.selected().as_str(), "pharmacy");
        // The user marker plus one result
        assert_eq!(session.map().markers().len(), 2);
    }

    #[test]
    fn test_watch_lines_counts_ignored_values() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Sink::File(dir.path().join("out.txt"));
        let mut session = located_session();

        let input = Cursor::new("casino\nEXIT\npolice\n");
        let changes = watch_lines(&mut session, input, OutputFormat::Table, &sink).unwrap();

        // The unlisted value is a change event, but it does not query
        assert_eq!(changes, 1);
        assert_eq!(session.queries_issued(), 1);
        assert_eq!(session.selected().as_str(), "hospital");
    }
}
