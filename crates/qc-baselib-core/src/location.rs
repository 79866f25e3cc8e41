//! Positional references attached to issues.

/// Position inside a referenced source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
    /// Row (1-based, 0 when unknown).
    pub row: u64,
    /// Column.
    pub column: u64,
    /// Kind of the referenced file (e.g., "xodr", "xosc").
    pub file_type: Option<String>,
    /// Optional note on this position.
    pub description: Option<String>,
}

impl FileLocation {
    /// Creates a file location.
    #[must_use]
    pub fn new(row: u64, column: u64, file_type: impl Into<String>) -> Self {
        Self {
            row,
            column,
            file_type: Some(file_type.into()),
            description: None,
        }
    }

    /// Attaches a description to this position.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Point in the inertial coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertialLocation {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl InertialLocation {
    /// Creates an inertial location.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Curvilinear position on a road.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadLocation {
    /// Road identifier.
    pub road_id: String,
    /// Offset along the reference line.
    pub s: f64,
    /// Lateral offset from the reference line.
    pub t: f64,
}

impl RoadLocation {
    /// Creates a road location.
    #[must_use]
    pub fn new(road_id: impl Into<String>, s: f64, t: f64) -> Self {
        Self {
            road_id: road_id.into(),
            s,
            t,
        }
    }
}

/// Node inside a referenced XML source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlLocation {
    /// Path expression selecting the node.
    pub xpath: String,
}

impl XmlLocation {
    /// Creates an XML location.
    #[must_use]
    pub fn new(xpath: impl Into<String>) -> Self {
        Self {
            xpath: xpath.into(),
        }
    }
}

/// A single location entry.
///
/// The set of kinds is fixed by the exchange format.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// See [`FileLocation`].
    File(FileLocation),
    /// See [`InertialLocation`].
    Inertial(InertialLocation),
    /// See [`RoadLocation`].
    Road(RoadLocation),
    /// See [`XmlLocation`].
    Xml(XmlLocation),
}

impl Location {
    /// Element name of this kind in the exchange format.
    #[must_use]
    pub const fn element_name(&self) -> &'static str {
        match self {
            Self::File(_) => "FileLocation",
            Self::Inertial(_) => "InertialLocation",
            Self::Road(_) => "RoadLocation",
            Self::Xml(_) => "XMLLocation",
        }
    }
}

impl From<FileLocation> for Location {
    fn from(value: FileLocation) -> Self {
        Self::File(value)
    }
}

impl From<InertialLocation> for Location {
    fn from(value: InertialLocation) -> Self {
        Self::Inertial(value)
    }
}

impl From<RoadLocation> for Location {
    fn from(value: RoadLocation) -> Self {
        Self::Road(value)
    }
}

impl From<XmlLocation> for Location {
    fn from(value: XmlLocation) -> Self {
        Self::Xml(value)
    }
}

/// A described group of location entries (`Locations` element).
#[derive(Debug, Clone, PartialEq)]
pub struct LocationGroup {
    description: Option<String>,
    locations: Vec<Location>,
}

impl LocationGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new(description: Option<String>) -> Self {
        Self {
            description,
            locations: Vec::new(),
        }
    }

    /// Adds an entry to the group.
    #[must_use]
    pub fn with(mut self, location: impl Into<Location>) -> Self {
        self.locations.push(location.into());
        self
    }

    /// Appends an entry to the group.
    pub fn push(&mut self, location: impl Into<Location>) {
        self.locations.push(location.into());
    }

    /// Group description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Returns true if the group has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
