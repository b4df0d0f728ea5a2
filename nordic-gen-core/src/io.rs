use std::path::{Path, PathBuf};
use std::{env, fs, io};

use encoding_rs::WINDOWS_1252;

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Decodes UTF-8, falling back to Windows-1252 for legacy exports
/// - Drops a leading byte order mark
/// - Splits on `\n` / `\r\n`
pub fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let bytes = fs::read(filename)?;
	let contents = decode(bytes);
	let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);
	Ok(contents.lines().map(str::to_owned).collect())
}

/// UTF-8 if valid, Windows-1252 (the "latin1" label) otherwise.
fn decode(bytes: Vec<u8>) -> String {
	match String::from_utf8(bytes) {
		Ok(text) => text,
		Err(e) => {
			log::debug!("not valid UTF-8 ({e}), decoding as Windows-1252");
			let (text, _, had_errors) = WINDOWS_1252.decode(e.as_bytes());
			if had_errors {
				log::warn!("some bytes could not be decoded and were replaced");
			}
			text.into_owned()
		}
	}
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn temp_dir(label: &str) -> PathBuf {
		let dir = env::temp_dir().join(format!("nordic-gen-io-{label}-{}", std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		dir
	}

	#[test]
	fn latin1_files_are_decoded() {
		let dir = temp_dir("latin1");
		let path = dir.join("swedish_male.csv");
		// "Förnamn;Antal\nÅke;12" in Latin-1
		fs::write(&path, b"F\xf6rnamn;Antal\n\xc5ke;12\n").unwrap();

		let lines = read_lines(&path).unwrap();
		assert_eq!(lines, vec!["Förnamn;Antal".to_owned(), "Åke;12".to_owned()]);
		fs::remove_dir_all(dir).unwrap();
	}

	#[test]
	fn windows_1252_only_bytes_are_decoded() {
		let dir = temp_dir("cp1252");
		let path = dir.join("swedish_female.csv");
		// 0x8a is 'Š' in Windows-1252 and a C1 control in ISO-8859-1
		fs::write(&path, b"\x8aarlota;7\n").unwrap();

		let lines = read_lines(&path).unwrap();
		assert_eq!(lines, vec!["Šarlota;7".to_owned()]);
		fs::remove_dir_all(dir).unwrap();
	}

	#[test]
	fn utf8_bom_is_dropped() {
		let dir = temp_dir("bom");
		let path = dir.join("finnish_female.csv");
		fs::write(&path, "\u{feff}Aino,\"1,234\"\r\nEmma,5\r\n").unwrap();

		let lines = read_lines(&path).unwrap();
		assert_eq!(lines, vec!["Aino,\"1,234\"".to_owned(), "Emma,5".to_owned()]);
		fs::remove_dir_all(dir).unwrap();
	}

	#[test]
	fn only_matching_extensions_are_listed() {
		let dir = temp_dir("list");
		fs::write(dir.join("swedish_male.csv"), "").unwrap();
		fs::write(dir.join("finnish_male.csv"), "").unwrap();
		fs::write(dir.join("notes.txt"), "").unwrap();

		let files = list_files(&dir, "csv").unwrap();
		assert_eq!(files, vec!["finnish_male.csv".to_owned(), "swedish_male.csv".to_owned()]);
		fs::remove_dir_all(dir).unwrap();
	}

	#[test]
	fn dot_is_the_current_directory() {
		assert_eq!(normalize_folder("."), env::current_dir().unwrap());
		assert_eq!(normalize_folder("names"), PathBuf::from("names"));
	}
}
