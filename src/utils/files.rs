use std::path::{Path, PathBuf};

use tokio::{
    fs::{self, File},
    io::{self, AsyncBufReadExt, Lines},
};

/// Read a file from the given path into a list of lines
pub async fn read_lines<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let mut r = line_reader(path).await?;
    let mut lines = Vec::new();

    while let Some(line) = r.next_line().await? {
        lines.push(line);
    }

    Ok(lines)
}

/// Read a whole file as a single line, with line breaks replaced by spaces
pub async fn read_joined<P: AsRef<Path>>(path: P) -> io::Result<String> {
    Ok(read_lines(path).await?.join(" "))
}

/// The files in a directory with the given extension, sorted by path
pub async fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut paths = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();

        if path.extension().is_some_and(|found| found == extension) {
            paths.push(path);
        }
    }

    paths.sort();

    Ok(paths)
}

async fn line_reader<P: AsRef<Path>>(path: P) -> io::Result<Lines<io::BufReader<File>>> {
    let f = File::open(path).await?;

    Ok(io::BufReader::new(f).lines())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_list_and_read() {
        let dir = std::env::temp_dir().join(format!("textcnn-files-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.txt"), "second\nfile").unwrap();
        std::fs::write(dir.join("a.txt"), "first").unwrap();
        std::fs::write(dir.join("c.json"), "{}").unwrap();

        let paths = list_files(&dir, "txt").await.unwrap();

        assert_eq!(paths, vec![dir.join("a.txt"), dir.join("b.txt")]);
        assert_eq!(read_lines(&paths[1]).await.unwrap(), vec!["second", "file"]);
        assert_eq!(read_joined(&paths[1]).await.unwrap(), "second file");

        std::fs::remove_dir_all(dir).unwrap();
    }
}
