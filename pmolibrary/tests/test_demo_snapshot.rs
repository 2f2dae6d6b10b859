//! Chargement de l'instantané de démonstration

use pmolibrary::{LibraryProvider, LibrarySnapshot, Music, MusicRepository, NameSearchEngine, SearchEngine, SearchItems};

const DEMO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../demos/library.json");

#[test]
fn test_demo_snapshot_builds() {
    let (device, user) = LibrarySnapshot::load(DEMO).unwrap().build().unwrap();

    assert_eq!(device.songs().len(), 4);
    assert_eq!(device.albums().len(), 2);
    assert_eq!(device.artists().len(), 3);
    assert_eq!(user.playlists().len(), 1);

    // Bill Evans n'a qu'un album implicite
    let evans = &device.artists()[2];
    assert!(evans.explicit_albums.is_empty());
    assert_eq!(evans.implicit_albums[0].title, "Kind of Blue");
}

#[test]
fn test_demo_snapshot_in_repository() {
    let (device, user) = LibrarySnapshot::load(DEMO).unwrap().build().unwrap();
    let playlist_uid = user.playlists()[0].uid;
    let repository = MusicRepository::new();
    repository.set_libraries(device, user);

    match repository.find(&playlist_uid) {
        Some(Music::Playlist(playlist)) => assert_eq!(playlist.songs[0].title, "Blue in Green"),
        other => panic!("expected playlist, got {:?}", other),
    }

    let device = repository.device_library().unwrap();
    let user = repository.user_library().unwrap();
    let found = NameSearchEngine::new().search(&SearchItems::from_libraries(&device, &user), "blue");
    // Blue in Green, Kind of Blue, Blue Monday
    assert_eq!(found.count(), 3);
}
