use uuid::Uuid;

/// 以 UUID 作為物件身份；pool 以此判斷兩個 handle 是否指向同一個 workspace。
pub trait ObjectWithUUID {
    fn uuid(&self) -> &Uuid;

    fn is_same_object(&self, other: &dyn ObjectWithUUID) -> bool {
        self.uuid() == other.uuid()
    }
}
