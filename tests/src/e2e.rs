mod tests {
    use crate::setup::setup::start_chain_server;

    use chain::{file_hash_of_path, generate_chain_from_path, reassemble};
    use chain_server::{http::SendRequest, ChunkStorage};
    use client::{check_file, check_integrity, health_check, list_files, send_file};
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_random_file(dir: &Path, name: &str, len: usize, seed: u64) -> PathBuf {
        let mut data = vec![0u8; len];
        StdRng::seed_from_u64(seed).fill(&mut data[..]);
        let path = dir.join(name);
        std::fs::write(&path, &data).unwrap();
        path
    }

    #[tokio::test]
    async fn test_health() {
        let server = start_chain_server().await;
        health_check(&server.base_url).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_check_and_dedup() {
        let server = start_chain_server().await;
        let dir = TempDir::new().unwrap();
        let path = write_random_file(dir.path(), "report.pdf", 12_345, 1);
        let file_hash = file_hash_of_path(&path).unwrap();

        let first = send_file(&server.base_url, &path).await.unwrap();
        assert!(first.success);
        assert!(first.new_file);
        assert_eq!(first.hash, file_hash);
        assert_eq!(first.chunk_count, 25);

        let second = send_file(&server.base_url, &path).await.unwrap();
        assert!(second.success);
        assert!(!second.new_file);
        assert_eq!(server.storage.chunk_count(&file_hash).await, 25);

        let check = check_file(&server.base_url, &path).await.unwrap();
        assert!(check.check);
        assert_eq!(check.hash, file_hash);
        assert!(check_integrity(&server.base_url).await.unwrap());
    }

    #[tokio::test]
    async fn test_check_unsent_file() {
        let server = start_chain_server().await;
        let dir = TempDir::new().unwrap();
        let path = write_random_file(dir.path(), "never-sent.bin", 800, 2);

        let check = check_file(&server.base_url, &path).await.unwrap();
        assert!(!check.check);
    }

    #[tokio::test]
    async fn test_empty_file() {
        let server = start_chain_server().await;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, b"").unwrap();

        let sent = send_file(&server.base_url, &path).await.unwrap();
        assert_eq!(sent.chunk_count, 1);
        assert_eq!(sent.hash, "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
        assert!(check_file(&server.base_url, &path).await.unwrap().check);
    }

    #[tokio::test]
    async fn test_several_files_listed_and_reassembled() {
        let server = start_chain_server().await;
        let dir = TempDir::new().unwrap();
        let paths = [
            write_random_file(dir.path(), "a.bin", 499, 3),
            write_random_file(dir.path(), "b.bin", 2000, 4),
            write_random_file(dir.path(), "c.bin", 5001, 5),
        ];
        for path in &paths {
            send_file(&server.base_url, path).await.unwrap();
        }

        let mut chunks: Vec<u64> = list_files(&server.base_url).await.unwrap().iter().map(|f| f.chunks).collect();
        chunks.sort();
        assert_eq!(chunks, vec![1, 4, 11]);

        for path in &paths {
            let file_hash = file_hash_of_path(path).unwrap();
            let bucket = server.storage.bucket(file_hash.clone()).await.unwrap().unwrap();
            let data = reassemble(&bucket, &file_hash, bucket.len() as u64).unwrap();
            assert_eq!(data, std::fs::read(path).unwrap());
        }
        assert!(check_integrity(&server.base_url).await.unwrap());
    }

    #[tokio::test]
    async fn test_tampered_upload_is_stored_but_fails_checks() {
        let server = start_chain_server().await;
        let dir = TempDir::new().unwrap();
        let good = write_random_file(dir.path(), "good.bin", 1500, 6);
        let bad = write_random_file(dir.path(), "bad.bin", 1500, 7);
        send_file(&server.base_url, &good).await.unwrap();

        let mut chunks = generate_chain_from_path(&bad).unwrap();
        chunks[1].payload[0] ^= 0x01;
        let res = reqwest::Client::new()
            .post(format!("{}/send", server.base_url))
            .json(&SendRequest { chunks })
            .send()
            .await
            .unwrap();
        assert!(res.status().is_success());

        assert!(check_file(&server.base_url, &good).await.unwrap().check);
        assert!(!check_file(&server.base_url, &bad).await.unwrap().check);
        assert!(!check_integrity(&server.base_url).await.unwrap());
    }

    #[tokio::test]
    async fn test_send_error_keeps_http_status() {
        let server = start_chain_server().await;
        let dir = TempDir::new().unwrap();
        let path = write_random_file(dir.path(), "misrouted.bin", 600, 8);

        // "{base}/files/send" is answered by warp's plain-text 404
        let err = send_file(&format!("{}/files", server.base_url), &path).await.unwrap_err();
        assert!(err.to_string().contains("404"), "{}", err);
    }

    #[tokio::test]
    async fn test_health_check_rejects_foreign_server() {
        let server = start_chain_server().await;
        // a path that is not the health endpoint answers 404
        assert!(health_check(&format!("{}/files", server.base_url)).await.is_err());
    }
}
