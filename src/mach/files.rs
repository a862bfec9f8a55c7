use super::snapshot::Persist;
use crate::error;
use crate::lang::Error;
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};

type Result<T> = std::result::Result<T, Error>;

/// Highest file number `OPEN` accepts.
pub const MAX_FILES: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileMode {
    Input,
    Output,
    Append,
    Random,
}

impl FileMode {
    fn options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            FileMode::Input => options.read(true),
            FileMode::Output => options.write(true).create(true).truncate(true),
            FileMode::Append => options.append(true).create(true),
            FileMode::Random => options.read(true).write(true).create(true),
        };
        options
    }

    pub fn is_writable(self) -> bool {
        self != FileMode::Input
    }
}

#[derive(Debug)]
enum Handle {
    Disk(File),
    /// Stands in for a file that could not be reopened.
    Null,
}

/// ## An open file
///
/// Snapshots record the name, mode and byte position instead of the
/// handle.
#[derive(Debug)]
pub struct OpenFile {
    name: String,
    mode: FileMode,
    handle: Handle,
}

/// What a snapshot keeps of an [`OpenFile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileImage {
    pub name: String,
    pub mode: FileMode,
    pub position: Option<u64>,
}

impl OpenFile {
    pub fn open(name: &str, mode: FileMode) -> Result<OpenFile> {
        let file = mode.options().open(name)?;
        Ok(OpenFile {
            name: name.to_string(),
            mode,
            handle: Handle::Disk(file),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn is_null(&self) -> bool {
        matches!(self.handle, Handle::Null)
    }

    pub fn position(&self) -> Option<u64> {
        match &self.handle {
            Handle::Disk(file) => {
                let mut file: &File = file;
                file.seek(SeekFrom::Current(0)).ok()
            }
            Handle::Null => None,
        }
    }

    pub fn write_str(&mut self, s: &str) -> Result<()> {
        if !self.mode.is_writable() {
            return Err(error!(BadFileMode));
        }
        match &mut self.handle {
            Handle::Disk(file) => Ok(file.write_all(s.as_bytes())?),
            Handle::Null => Ok(()),
        }
    }

    pub fn close(self) -> Result<()> {
        if let Handle::Disk(mut file) = self.handle {
            if self.mode.is_writable() {
                file.flush()?;
            }
        }
        Ok(())
    }

    fn reopen(image: &FileImage) -> io::Result<File> {
        let position = image.position.unwrap_or(0);
        match image.mode {
            FileMode::Output if position > 0 => {
                // Keep what was written up to the saved position.
                let mut prefix = Vec::new();
                File::open(&image.name)?
                    .take(position)
                    .read_to_end(&mut prefix)?;
                let mut file = image.mode.options().open(&image.name)?;
                file.write_all(&prefix)?;
                Ok(file)
            }
            FileMode::Output | FileMode::Append => image.mode.options().open(&image.name),
            FileMode::Input | FileMode::Random => {
                let mut file = OpenOptions::new()
                    .read(true)
                    .write(image.mode == FileMode::Random)
                    .open(&image.name)?;
                file.seek(SeekFrom::Start(position))?;
                Ok(file)
            }
        }
    }
}

impl Persist for OpenFile {
    type Image = FileImage;

    fn externalize(&self) -> FileImage {
        FileImage {
            name: self.name.clone(),
            mode: self.mode,
            position: self.position(),
        }
    }

    fn internalize(image: FileImage) -> OpenFile {
        let handle = match OpenFile::reopen(&image) {
            Ok(file) => Handle::Disk(file),
            Err(e) => {
                warn!("Could not reopen {}: {}", image.name, e);
                Handle::Null
            }
        };
        OpenFile {
            name: image.name,
            mode: image.mode,
            handle,
        }
    }
}

impl Serialize for OpenFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.externalize().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OpenFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        FileImage::deserialize(deserializer).map(OpenFile::internalize)
    }
}

/// ## Open files by number

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FileTable {
    files: BTreeMap<u8, OpenFile>,
}

impl FileTable {
    pub fn new() -> FileTable {
        FileTable::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn open(&mut self, number: u8, name: &str, mode: FileMode) -> Result<()> {
        if number == 0 || number > MAX_FILES {
            return Err(error!(BadFileNumber));
        }
        if self.files.contains_key(&number) {
            return Err(error!(FileAlreadyOpen));
        }
        let file = OpenFile::open(name, mode)?;
        debug!("Opened #{} {} for {:?}", number, name, mode);
        self.files.insert(number, file);
        Ok(())
    }

    pub fn get_mut(&mut self, number: u8) -> Result<&mut OpenFile> {
        self.files.get_mut(&number).ok_or_else(|| error!(BadFileNumber))
    }

    pub fn get(&self, number: u8) -> Option<&OpenFile> {
        self.files.get(&number)
    }

    /// Closing a number that is not open does nothing.
    pub fn close(&mut self, number: u8) -> Result<()> {
        match self.files.remove(&number) {
            Some(file) => file.close(),
            None => Ok(()),
        }
    }

    pub fn close_all(&mut self) {
        for (number, file) in std::mem::take(&mut self.files) {
            if let Err(e) = file.close() {
                warn!("Closing #{}: {}", number, e);
            }
        }
    }
}
