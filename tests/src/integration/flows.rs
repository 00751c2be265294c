//! # Wallet Lifecycle Flows
//!
//! Drives a wallet from seed to ledger recovery through `RndDerivationApi`:
//!
//! 1. **Generation**: seed → root key → key bundle → issued addresses
//! 2. **Recovery**: ledger scan with the payload passphrase
//! 3. **Rotation**: spending passphrase change and its hazards

#[cfg(test)]
mod tests {
    use rand::{Rng, RngCore};
    use tracing_subscriber::EnvFilter;

    use rnd_derivation::{
        AddressAttributes, AddressIndex, AddressPayload, DerivationPath, Ed25519Bip32Engine,
        Encryption, Hardened, Index, Ownership, Passphrase, PayloadDerivation,
        RndDerivationApi, RndDerivationService, RndKey, RndWallet, Root, ScanConfig, Seed, Soft,
        WalletKey,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    type Service = RndDerivationService<Ed25519Bip32Engine>;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn service() -> Service {
        RndDerivationService::new(Ed25519Bip32Engine::new())
    }

    fn random_seed() -> Passphrase<Seed> {
        let mut entropy = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut entropy);
        Passphrase::new(entropy)
    }

    /// A wallet as the surrounding engine holds it.
    struct TestWallet {
        root: RndKey<Root>,
        payload_key: Passphrase<PayloadDerivation>,
    }

    fn new_wallet(service: &Service, spending: &Passphrase<Encryption>) -> TestWallet {
        let root = service
            .generate_root_key(&random_seed(), spending)
            .expect("32-byte seed is in range");
        let payload_key = service.payload_passphrase(&root);
        TestWallet { root, payload_key }
    }

    /// Address payload as it would appear on the ledger.
    fn issue_address(
        service: &Service,
        payload_key: &Passphrase<PayloadDerivation>,
        path: &DerivationPath,
    ) -> Vec<u8> {
        let mut root_hash = vec![0u8; 28];
        rand::thread_rng().fill_bytes(&mut root_hash);

        let mut attributes = AddressAttributes::new();
        attributes.insert(
            1,
            service
                .encode_derivation_path_attribute(payload_key, path)
                .expect("encode attribute"),
        );
        AddressPayload::new(root_hash, attributes)
            .to_cbor()
            .expect("encode address")
    }

    fn issued_paths() -> Vec<DerivationPath> {
        let mut paths = Vec::new();
        for account in 0..3 {
            let account = Index::<Hardened>::from_offset(account).unwrap();
            for address in 0..4 {
                paths.push(DerivationPath::new(account, Index::<Soft>::new(address).unwrap()));
            }
            paths.push(DerivationPath::new(account, Index::<Hardened>::MIN));
        }
        paths
    }

    // =============================================================================
    // GENERATION AND RECOVERY
    // =============================================================================

    /// Every address a wallet issued is found again among foreign and
    /// malformed ledger entries, with its original path.
    #[test]
    fn test_issued_addresses_recovered_from_ledger() {
        init_tracing();
        let service = service();
        let spending = Passphrase::new("wallet spending password");
        let wallet = new_wallet(&service, &spending);
        let stranger = new_wallet(&service, &Passphrase::empty());

        let mut ledger = Vec::new();
        let mut expected = Vec::new();
        for (i, path) in issued_paths().into_iter().enumerate() {
            expected.push((ledger.len(), path));
            ledger.push(issue_address(&service, &wallet.payload_key, &path));

            ledger.push(issue_address(
                &service,
                &stranger.payload_key,
                &DerivationPath::from_raw(0x8000_0000, i as u32),
            ));
            if i % 4 == 0 {
                ledger.push(vec![0x82, 0x00]);
            }
        }

        let report = service.scan_addresses(&wallet.payload_key, &ledger);
        assert_eq!(report.matches, expected);
        assert_eq!(report.not_mine, expected.len());
        assert_eq!(report.scanned(), ledger.len());
        assert_eq!(report.malformed.len(), ledger.len() - 2 * expected.len());
    }

    /// The issued address keys are the ones the recovered paths lead back to.
    #[test]
    fn test_recovered_path_rederives_address_key() {
        let service = service();
        let spending = Passphrase::new("pw");
        let wallet = new_wallet(&service, &spending);

        let account = Index::<Hardened>::from_offset(2).unwrap();
        let index = AddressIndex::from(Index::<Soft>::new(17).unwrap());
        let account_key = service.derive_account_private_key(&spending, &wallet.root, account);
        let issued_key = service.derive_address_private_key(&spending, &account_key, index);

        let address = issue_address(
            &service,
            &wallet.payload_key,
            &DerivationPath::new(account, index),
        );
        let recovered = service
            .decode_address_derivation_path(&wallet.payload_key, &address)
            .path()
            .expect("address belongs to wallet");

        let handle = RndWallet::new(service.engine(), wallet.root.clone());
        let rederived = handle.derive_path(&spending, &recovered).unwrap();
        assert_eq!(&rederived, issued_key.xprv());
    }

    /// Addresses of randomly drawn foreign wallets are never claimed.
    #[test]
    fn test_random_foreign_addresses_are_not_mine() {
        let service = service();
        let wallet = new_wallet(&service, &Passphrase::empty());
        let mut rng = rand::thread_rng();

        for _ in 0..8 {
            let foreign = new_wallet(&service, &Passphrase::empty());
            let path = DerivationPath::new(
                Index::<Hardened>::from_offset(rng.gen_range(0..1000)).unwrap(),
                AddressIndex::from(rng.gen::<u32>()),
            );
            let address = issue_address(&service, &foreign.payload_key, &path);

            assert_eq!(
                service.decode_address_derivation_path(&wallet.payload_key, &address),
                Ownership::NotMine
            );
            assert_eq!(
                service.decode_address_derivation_path(&foreign.payload_key, &address),
                Ownership::Decoded(path)
            );
        }
    }

    #[test]
    fn test_address_without_path_attribute_is_malformed() {
        let service = service();
        let wallet = new_wallet(&service, &Passphrase::empty());
        let address = AddressPayload::new(vec![0u8; 28], AddressAttributes::new())
            .to_cbor()
            .unwrap();

        assert!(matches!(
            service.decode_address_derivation_path(&wallet.payload_key, &address),
            Ownership::Malformed(_)
        ));
    }

    // =============================================================================
    // DETERMINISM
    // =============================================================================

    /// A restored wallet reproduces keys and payload passphrase bit for bit.
    #[test]
    fn test_restore_from_same_seed_is_identical() {
        let service = service();
        let seed_bytes: Vec<u8> = (0..24).map(|_| rand::thread_rng().gen()).collect();
        let spending = Passphrase::new("restore me");

        let original = service
            .generate_root_key(&Passphrase::new(seed_bytes.clone()), &spending)
            .unwrap();
        let restored = service
            .generate_root_key(&Passphrase::new(seed_bytes), &spending)
            .unwrap();
        assert_eq!(original, restored);

        let a = service.build_key_bundle(&spending, &original);
        let b = service.build_key_bundle(&spending, &restored);
        assert_eq!(a.account_key, b.account_key);
        assert_eq!(a.address_key, b.address_key);
        assert_eq!(a.payload_passphrase.as_bytes(), b.payload_passphrase.as_bytes());
    }

    /// Parallel and sequential scans agree on a ledger large enough to split.
    #[test]
    fn test_scan_modes_agree() {
        let engine = Ed25519Bip32Engine::new();
        let parallel = RndDerivationService::with_config(
            engine,
            ScanConfig::default()
                .with_parallel_threshold(8)
                .with_min_chunk_len(2),
        )
        .unwrap();
        let sequential =
            RndDerivationService::with_config(Ed25519Bip32Engine::new(), ScanConfig::sequential())
                .unwrap();

        let wallet = new_wallet(&sequential, &Passphrase::empty());
        let stranger = new_wallet(&sequential, &Passphrase::empty());
        let ledger: Vec<Vec<u8>> = (0..40u32)
            .map(|i| {
                let path = DerivationPath::from_raw(0x8000_0000 + i % 3, i);
                match i % 4 {
                    0 | 1 => issue_address(&sequential, &wallet.payload_key, &path),
                    2 => issue_address(&sequential, &stranger.payload_key, &path),
                    _ => vec![0xFF; i as usize % 5],
                }
            })
            .collect();

        assert_eq!(
            parallel.scan_addresses(&wallet.payload_key, &ledger),
            sequential.scan_addresses(&wallet.payload_key, &ledger)
        );
    }

    // =============================================================================
    // PASSPHRASE ROTATION
    // =============================================================================

    /// Rotating the spending passphrase keeps every issued address ours.
    #[test]
    fn test_rotation_keeps_addresses_recoverable() {
        let service = service();
        let old = Passphrase::new("old secret");
        let new = Passphrase::new("new secret");
        let wallet = new_wallet(&service, &old);

        let path = DerivationPath::from_raw(0x8000_0001, 9);
        let address = issue_address(&service, &wallet.payload_key, &path);

        let rotated = service.change_passphrase(&old, &new, &wallet.root);
        assert_eq!(
            service.decode_address_derivation_path(&rotated.payload_passphrase, &address),
            Ownership::Decoded(path)
        );

        let before = RndWallet::new(service.engine(), wallet.root.clone());
        let after = before.change_passphrase(&old, &new);
        assert_eq!(before.public_key(), after.public_key());
        assert_eq!(
            before.derive_path(&old, &path).unwrap(),
            after.derive_path(&new, &path).unwrap()
        );
    }

    /// A wrong old passphrase is accepted and silently corrupts the keys.
    #[test]
    fn test_rotation_with_wrong_old_passphrase_corrupts_silently() {
        let service = service();
        let old = Passphrase::new("old secret");
        let new = Passphrase::new("new secret");
        let wallet = new_wallet(&service, &old);

        let correct = service.change_passphrase(&old, &new, &wallet.root);
        for typo in ["typo", "old secre", "Old secret", "old secret "] {
            let corrupt = service.change_passphrase(&Passphrase::new(typo), &new, &wallet.root);

            assert_ne!(correct.root_key, corrupt.root_key);
            assert_ne!(correct.address_key, corrupt.address_key);
            assert_eq!(
                correct.payload_passphrase.as_bytes(),
                corrupt.payload_passphrase.as_bytes()
            );
        }
    }
}
