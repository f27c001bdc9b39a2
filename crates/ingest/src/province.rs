/// Augustan regiones of Italy; all collapse into one region.
const ITALIAN_REGIONES: [&str; 11] = [
    "Latium et Campania / Regio I",
    "Apulia et Calabria / Regio II",
    "Bruttium et Lucania / Regio III",
    "Samnium / Regio IV",
    "Picenum / Regio V",
    "Umbria / Regio VI",
    "Etruria / Regio VII",
    "Aemilia / Regio VIII",
    "Liguria / Regio IX",
    "Venetia et Histria / Regio X",
    "Transpadana / Regio XI",
];

/// Map a free-text province onto the region names used by the analysis side.
pub fn normalize_province(raw: &str) -> String {
    let province = raw.trim();

    if ITALIAN_REGIONES.contains(&province) {
        return "Italia".to_string();
    }

    match province {
        "Belgica | Germania inferior" | "Belgica | Germania superior" => "Belgica".to_string(),
        "Aquitani(c)a" | "Aquitani" => "Aquitania".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regiones_collapse_to_italia() {
        assert_eq!(normalize_province("Etruria / Regio VII"), "Italia");
        assert_eq!(normalize_province("  Transpadana / Regio XI "), "Italia");
    }

    #[test]
    fn test_variant_spellings() {
        assert_eq!(normalize_province("Belgica | Germania superior"), "Belgica");
        assert_eq!(normalize_province("Aquitani(c)a"), "Aquitania");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(normalize_province("Roma"), "Roma");
        assert_eq!(normalize_province("Lusitania "), "Lusitania");
    }
}
