use eyre::{Result, WrapErr};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Reads all of `name`, where "stdin" means standard input.
pub async fn read_source(name: &str) -> Result<Vec<u8>> {
    match name {
        "stdin" => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            Ok(buf)
        }
        _ => tokio::fs::read(name)
            .await
            .wrap_err_with(|| format!("reading {}", name)),
    }
}

/// Writes `bytes` to `name`, where "stdout" means standard output.
pub async fn write_sink(name: &str, bytes: &[u8]) -> Result<()> {
    match name {
        "stdout" => {
            let mut out = tokio::io::stdout();
            out.write_all(bytes).await?;
            out.flush().await?;
        }
        _ => {
            let mut f = tokio::fs::File::create(name)
                .await
                .wrap_err_with(|| format!("creating {}", name))?;
            f.write_all(bytes).await?;
            f.flush().await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("spinevis-io-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name).to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn file_sink_then_source() {
        let path = scratch("roundtrip.json");
        write_sink(&path, b"{\"data\":{}}\n").await.unwrap();
        assert_eq!(read_source(&path).await.unwrap(), b"{\"data\":{}}\n".to_vec());

        // Sinks truncate.
        write_sink(&path, b"[]").await.unwrap();
        assert_eq!(read_source(&path).await.unwrap(), b"[]".to_vec());
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn missing_source_names_the_file() {
        let path = scratch("does-not-exist.json");
        let err = read_source(&path).await.unwrap_err();
        assert!(format!("{:#}", err).contains("does-not-exist.json"));
    }

    #[tokio::test]
    async fn unwritable_sink_names_the_file() {
        let path = scratch("no-such-dir/out.json");
        let err = write_sink(&path, b"x").await.unwrap_err();
        assert!(format!("{:#}", err).contains("out.json"));
    }

    #[tokio::test]
    async fn stdout_sink() {
        write_sink("stdout", b"").await.unwrap();
    }
}
